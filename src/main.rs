#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    burocrat_ai_service::run().await
}
