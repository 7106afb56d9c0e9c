//! Batch renaming of TV episode files to `Series S01E05.ext` / `Series E0005.ext`.

pub mod error;
pub mod patterns;
pub mod rename_engine;
pub mod tui;
