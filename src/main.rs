#[tokio::main]
async fn main() -> std::io::Result<()> {
    poker_nights::run().await
}
