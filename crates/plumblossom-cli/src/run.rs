use plumblossom_lib::models::SourceId;
use plumblossom_scraper::bus::SourceBus;

pub async fn run(bus: &SourceBus, source: SourceId) -> Result<(), anyhow::Error> {
    let chapters = bus.get_chapters(source).await?;
    info!("{source}: {} chapters", chapters.len());

    println!("{}", serde_json::to_string_pretty(&chapters)?);

    Ok(())
}

pub async fn content(bus: &SourceBus, source: SourceId, url: &str) -> Result<(), anyhow::Error> {
    let content = bus.get_content(source, url).await?;

    println!("{}", content.content);

    Ok(())
}
