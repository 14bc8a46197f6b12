pub mod cell;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod notify;
pub mod state;
pub mod sync;
pub mod transfer;

pub use cell::{Cell, CellClass, Direction, Region};
pub use config::EditorConfig;
pub use document::GridDocument;
pub use error::{Diagnostic, DiagnosticKind, GridError, ListenerFault, TransportError};
pub use export::{ExportCell, ExportContent, ExportSheet};
pub use grid::Grid;
pub use model::{GridModel, KeyOutcome, PointerButton};
pub use notify::Notifier;
pub use state::{CellPosition, EditorState, Focus, Key, LinearSelection, Modifiers};
pub use sync::{CellLayout, CellView, NullView, RecordingView, ViewPatch};
pub use transfer::{TransferResponse, Transport};
