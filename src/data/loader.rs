use bevy::asset::{io::Reader, ron, AssetLoader, LoadContext};
use std::future::Future;
use thiserror::Error;

use super::schema::ItemList;

#[derive(Default)]
pub struct RonItemLoader;

#[derive(Debug, Error)]
pub enum RonItemLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// 解析物品表文本，loader 和测试共用
pub fn parse_item_list(bytes: &[u8]) -> Result<ItemList, RonItemLoaderError> {
    let s = std::str::from_utf8(bytes)?;
    Ok(ron::de::from_str(s)?)
}

impl AssetLoader for RonItemLoader {
    type Asset = ItemList;
    type Settings = ();
    type Error = RonItemLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_item_list(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_with_optional_fields() {
        let list = parse_item_list(
            br#"(items: [
                (id: 1, name: "Apple", icon: "icons/apple.png", description: "Crunchy."),
                (id: 7, name: "Stone"),
            ])"#,
        )
        .unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].description, "Crunchy.");
        assert_eq!(list.items[1].id, 7);
        assert!(list.items[1].icon.is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            parse_item_list(b"(items: [(name: \"no id\")])"),
            Err(RonItemLoaderError::Ron(_))
        ));
        assert!(matches!(
            parse_item_list(&[0xff, 0xfe]),
            Err(RonItemLoaderError::Utf8(_))
        ));
    }
}
