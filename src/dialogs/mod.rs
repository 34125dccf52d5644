//! Open-file dialogs
//!
//! Narrow seam over the native file dialogs so the coordinator can be
//! driven by a stub in tests. A cancelled dialog returns None.

use std::path::PathBuf;

/// File-picking collaborator
pub trait FileDialogs {
    /// Pick the text file a counter reads its count from
    fn open_counter_file(&self) -> Option<PathBuf>;

    /// Pick one or more sound files
    fn open_sound_files(&self) -> Option<Vec<PathBuf>>;
}

/// rfd-backed implementation
#[derive(Default)]
pub struct NativeDialogs;

impl FileDialogs for NativeDialogs {
    fn open_counter_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("Text files", &["txt"])
            .add_filter("All files", &["*"])
            .pick_file()
    }

    fn open_sound_files(&self) -> Option<Vec<PathBuf>> {
        rfd::FileDialog::new()
            .add_filter("WAV audio", &["wav"])
            .add_filter("All files", &["*"])
            .pick_files()
    }
}
