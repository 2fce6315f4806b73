use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    solbot::run().await?;
    Ok(())
}
