use crate::model::Chapter;

const BUILTIN_CHAPTERS: &str = include_str!("../assets/chapters.json");

/// The course catalog shipped with the service, used to seed empty stores.
pub fn builtin_chapters() -> Result<Vec<Chapter>, serde_json::Error> {
    let mut chapters: Vec<Chapter> = serde_json::from_str(BUILTIN_CHAPTERS)?;
    chapters.sort_by_key(|c| c.order_index);

    Ok(chapters)
}
