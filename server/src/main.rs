#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    worldfeel_server::start_server().await?;
    Ok(())
}
