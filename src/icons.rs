use anyhow::anyhow;
use gpui::*;
use rust_embed::RustEmbed;
use std::borrow::Cow;

/// An asset source that loads assets from the `./assets` folder.
#[derive(RustEmbed)]
#[folder = "./assets"]
#[include = "icons/**/*.svg"]
pub struct Assets;

impl AssetSource for Assets {
    fn load(&self, path: &str) -> Result<Option<Cow<'static, [u8]>>> {
        if path.is_empty() {
            return Ok(None);
        }

        Self::get(path)
            .map(|f| Some(f.data))
            .ok_or_else(|| anyhow!("could not find asset at path \"{path}\""))
    }

    fn list(&self, path: &str) -> Result<Vec<SharedString>> {
        Ok(Self::iter()
            .filter_map(|p| p.starts_with(path).then(|| p.into()))
            .collect())
    }
}

use gpui_component::IconNamed;

pub enum IconName {
    BookOpen,
    ChevronLeft,
    ChevronRight,
    File,
    LoaderCircle,
    Maximize,
    Minus,
    PanelLeftDashed,
    Plus,
    Rows,
}

impl IconNamed for IconName {
    fn path(self) -> gpui::SharedString {
        match self {
            Self::BookOpen => "icons/book-open.svg",
            Self::ChevronLeft => "icons/chevron-left.svg",
            Self::ChevronRight => "icons/chevron-right.svg",
            Self::File => "icons/file.svg",
            Self::LoaderCircle => "icons/loader-circle.svg",
            Self::Maximize => "icons/maximize.svg",
            Self::Minus => "icons/minus.svg",
            Self::PanelLeftDashed => "icons/panel-left-dashed.svg",
            Self::Plus => "icons/plus.svg",
            Self::Rows => "icons/rows.svg",
        }
        .into()
    }
}
