#[actix_web::main]
async fn main() -> std::io::Result<()> {
    invoice_generator::run().await
}
