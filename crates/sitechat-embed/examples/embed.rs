use sitechat_core::Config;
use sitechat_embed::load_embedder;

fn main() -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let embedder = load_embedder(&settings.embedding)?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed(&texts)?;
    let cos: f32 = embs[0].iter().zip(&embs[1]).map(|(a, b)| a * b).sum();
    println!("model={} B={} dim={} cos={cos:.4}", embedder.id(), embs.len(), embedder.dim());
    Ok(())
}
