#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dmc_generator::run().await
}
