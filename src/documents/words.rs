//! Сумма прописью: renders a ruble amount as Russian words, declining both
//! the scale nouns (тысяча/тысячи/тысяч and upwards) and the currency noun
//! (рубль/рубля/рублей). Kopecks stay numeric, zero-padded to two digits,
//! with the fixed form «копеек».

const UNITS: [&str; 10] = [
    "", "один", "два", "три", "четыре", "пять", "шесть", "семь", "восемь", "девять",
];

// Тысяча is feminine, so 1 and 2 decline differently in that group.
const UNITS_FEMININE: [&str; 10] = [
    "", "одна", "две", "три", "четыре", "пять", "шесть", "семь", "восемь", "девять",
];

const TEENS: [&str; 10] = [
    "десять",
    "одиннадцать",
    "двенадцать",
    "тринадцать",
    "четырнадцать",
    "пятнадцать",
    "шестнадцать",
    "семнадцать",
    "восемнадцать",
    "девятнадцать",
];

const TENS: [&str; 10] = [
    "",
    "",
    "двадцать",
    "тридцать",
    "сорок",
    "пятьдесят",
    "шестьдесят",
    "семьдесят",
    "восемьдесят",
    "девяносто",
];

const HUNDREDS: [&str; 10] = [
    "",
    "сто",
    "двести",
    "триста",
    "четыреста",
    "пятьсот",
    "шестьсот",
    "семьсот",
    "восемьсот",
    "девятьсот",
];

/// Scale groups above the bare hundreds triplet: group value, whether the
/// group noun is feminine, and its three declined forms.
const GROUPS: [(u64, bool, [&str; 3]); 4] = [
    (
        1_000_000_000_000,
        false,
        ["триллион", "триллиона", "триллионов"],
    ),
    (1_000_000_000, false, ["миллиард", "миллиарда", "миллиардов"]),
    (1_000_000, false, ["миллион", "миллиона", "миллионов"]),
    (1_000, true, ["тысяча", "тысячи", "тысяч"]),
];

/// Pick the declined form for a count: singular for 1, the few-form for
/// 2–4, the many-form otherwise. Teens always take the many-form.
fn declined<'a>(count: u64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    if (11..=19).contains(&(count % 100)) {
        return many;
    }
    match count % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

/// Append the words for a value below 1000. `feminine` switches один/два to
/// одна/две for feminine group nouns.
fn push_triplet(value: u64, feminine: bool, words: &mut Vec<&'static str>) {
    debug_assert!(value < 1000);
    let hundreds = (value / 100) as usize;
    if hundreds > 0 {
        words.push(HUNDREDS[hundreds]);
    }

    let below_hundred = value % 100;
    if (10..=19).contains(&below_hundred) {
        // Teens are single words and never take a trailing unit.
        words.push(TEENS[(below_hundred - 10) as usize]);
        return;
    }

    if below_hundred >= 20 {
        words.push(TENS[(below_hundred / 10) as usize]);
    }
    let unit = (below_hundred % 10) as usize;
    if unit > 0 {
        words.push(if feminine {
            UNITS_FEMININE[unit]
        } else {
            UNITS[unit]
        });
    }
}

/// Render a non-negative ruble amount in words, first letter capitalized:
/// `1234.56` → «Одна тысяча двести тридцать четыре рубля 56 копеек».
pub fn amount_in_words(amount: f64) -> String {
    let mut rubles = amount.trunc() as u64;
    let mut kopecks = ((amount - amount.trunc()) * 100.0).round() as u64;
    // Rounding can push the fraction up to a full ruble.
    if kopecks == 100 {
        rubles += 1;
        kopecks = 0;
    }
    // Kopecks are not representable in f64 past this point anyway.
    rubles = rubles.min(999_999_999_999_999);

    let mut words: Vec<&'static str> = Vec::new();
    if rubles == 0 {
        words.push("ноль");
    } else {
        let mut rest = rubles;
        for &(scale, feminine, [one, few, many]) in GROUPS.iter() {
            let count = rest / scale;
            if count > 0 {
                push_triplet(count, feminine, &mut words);
                words.push(declined(count, one, few, many));
                rest %= scale;
            }
        }
        if rest > 0 {
            push_triplet(rest, false, &mut words);
        }
    }
    words.push(declined(rubles, "рубль", "рубля", "рублей"));

    let mut text = words.join(" ");
    text.push_str(&format!(" {:02} копеек", kopecks));

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => text,
    }
}
