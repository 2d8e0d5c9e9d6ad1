//! Print a token for the audience `example.com` using the default credentials.

use aws_fed_id::{default_context, Config, TokenGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = default_context();
    let config = Config::default().from_env(&ctx)?;

    let generator = TokenGenerator::new(ctx, config);
    println!("{}", generator.generate("example.com").await?);

    Ok(())
}
