//! Outline notation to mind-map transcoding.
//!
//! Outline text marks heading depth with a leading run of `+` characters,
//! optionally wrapped in `@startmindmap` / `@endmindmap` lines:
//!
//! ```text
//! @startmindmap
//! + Project
//! ++ Goals
//! ++ Risks
//! @endmindmap
//! ```
//!
//! [`parse`] turns that into an [`OutlineNode`] tree and [`serialize`] writes
//! the tree as a Freemind `.mm` document. [`to_markdown`] renders the same
//! tree as Markdown headers.

mod download;
mod freemind;
mod markdown;
mod outline;

pub use download::{DownloadOptions, MindMapFile, build_download, is_downloadable};
pub use freemind::{MindMapOptions, serialize, serialize_with};
pub use markdown::{outline_to_markdown, to_markdown};
pub use outline::{OutlineOptions, parse, parse_with};

pub use mindscribe_shared::OutlineNode;
