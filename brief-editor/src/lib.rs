//! The article editor core
//!
//!     Everything the authoring page needs besides rendering: the document model the editor
//!     mutates, the commands that mutate it, the sync rules between the editor and the page
//!     that owns the content, image insertion, and reader analytics for published posts.
//!
//!     HTML is the stored form. Every content change is serialized to canonical HTML through
//!     brief-babel and its Markdown twin is derived from that HTML, never the other way round.
//!
//! Architecture
//!
//!     .
//!     ├── schema          # RichDocument, blocks, marked inline runs, IR conversion
//!     ├── engine          # DocumentEditor: selection, commands, undo history
//!     ├── sync.rs         # echo suppression between caller values and local edits
//!     ├── editor          # RichTextEditor component, toolbar view model, link prompt
//!     ├── assets          # validate / optimize / upload / insert images
//!     ├── analytics       # session tracker: views, scroll depth, time on page
//!     └── clock.rs
//!
//!     External collaborators (storage, toasts, analytics backend, session storage, link
//!     prompt) are traits. Nothing here is global; callers construct and inject them.
//!
//! Concurrency
//!
//!     Single threaded. Uploads are futures that only call the image service; their outcomes
//!     are applied to the upload tracker and the editor afterwards, keyed by upload id.
//!
pub mod analytics;
pub mod assets;
pub mod clock;
pub mod editor;
pub mod engine;
pub mod schema;
pub mod sync;

pub use clock::{Clock, SystemClock};
pub use editor::{EditorOptions, EditorProps, RichTextEditor};
pub use engine::{DocumentEditor, EditorCommand, Selection};
pub use sync::{ContentMode, ContentValue, DualRepresentation};
