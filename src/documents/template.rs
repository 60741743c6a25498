//! Document assembly pipeline.
//!
//! One pipeline drives every document kind: validate the items, compute
//! totals, assign a number, then let the kind-specific template lay its
//! sections into the shared tree. Templates only decide WHAT goes into each
//! section; ordering and the surrounding plumbing live here.

use super::layout::DocumentTree;
use super::numbering::document_number;
use super::schema::{DocumentKind, LineItem};
use super::totals::Totals;
use super::validation::validate_items;
use super::GeneratorError;

/// Kind-specific layout strategy. The section hooks run in a fixed order:
/// header, parties, item table, totals with the amount in words, trailing
/// variant sections, signatures.
pub trait DocumentTemplate {
    fn kind(&self) -> DocumentKind;

    fn items(&self) -> &[LineItem];

    /// Page margin in millimeters.
    fn margin_mm(&self) -> f32 {
        20.0
    }

    fn header(&self, number: &str, tree: &mut DocumentTree);

    fn parties(&self, tree: &mut DocumentTree);

    fn items_table(&self, tree: &mut DocumentTree);

    fn totals_section(&self, totals: &Totals, tree: &mut DocumentTree);

    /// Variant-specific sections between the totals and the signatures.
    fn extra_sections(&self, _tree: &mut DocumentTree) {}

    fn signatures(&self, tree: &mut DocumentTree);
}

/// An assembled, not yet rendered document.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub totals: Totals,
    pub tree: DocumentTree,
}

/// Run the assembly pipeline for one request. Validation comes first; an
/// invalid request produces no tree, no number and no side effects.
pub fn assemble<T>(template: &T) -> Result<AssembledDocument, GeneratorError>
where
    T: DocumentTemplate + ?Sized,
{
    validate_items(template.items())?;

    let totals = Totals::from_items(template.items());
    let number = document_number(template.kind());

    let mut tree = DocumentTree::new(template.margin_mm());
    template.header(&number, &mut tree);
    template.parties(&mut tree);
    template.items_table(&mut tree);
    template.totals_section(&totals, &mut tree);
    template.extra_sections(&mut tree);
    template.signatures(&mut tree);

    Ok(AssembledDocument {
        kind: template.kind(),
        number,
        totals,
        tree,
    })
}
