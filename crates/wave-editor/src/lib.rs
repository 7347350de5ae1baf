//! Interactive Elliott Wave annotation editor.
//!
//! The [`Editor`] owns the annotation document (wave collection and
//! selection), the undo/redo history and the interaction state machine. It
//! consumes a [`CoordinateTransform`] from the chart for pixel conversions and
//! an optional candle slice for magnet snapping, and never touches rendering.
//!
//! ```ignore
//! let mut editor = Editor::new(&Config::load_default());
//! let ctx = ChartContext::new(&transform, &candles);
//!
//! editor.execute(Command::SetMode(Mode::DrawImpulse), &ctx)?;
//! for pos in clicks {
//!     editor.execute(Command::Press(pos), &ctx)?;
//! }
//! let report = editor.validate_focused();
//! ```

pub mod coords;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod fibo;
pub mod history;
pub mod input;
pub mod snap;

pub use coords::{CoordinateTransform, LinearTransform, ScreenPos};
pub use document::Document;
pub use editor::{ChartContext, Drag, Editor, EditorState};
pub use error::{EditorError, HistoryDirection, Result};
pub use events::{Command, Mode, Modifiers, Outcome};
pub use fibo::{FiboLevel, FiboTemplate, SegmentAnchor};
pub use hit_test::{Hit, HitTester, PointHit, SegmentHit};
pub use history::History;
pub use input::{InputContext, Key};
pub use snap::{snap_point, SnapSettings};
