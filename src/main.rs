use edgarr::bootstrapper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrapper::run().await
}
