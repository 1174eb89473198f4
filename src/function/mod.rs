//! Piecewise transition functions.
//!
//! A [`Function`] is a gapless chain of [`Subfunction`]s, each a curve of one
//! [`Degree`] over its own slice of the argument domain.

mod context;
mod degree;
mod piecewise;
mod record;
mod subfunction;

pub use context::{ArgumentKind, EvalContext, Orientation, TrackQuery};
pub use degree::{ControlPoint, Degree, DegreeKind, Freeform};
pub use piecewise::{FuncType, Function};
pub use record::{FUNCTION_MAGIC, SUBFUNCTION_RECORD_LEN};
pub use subfunction::Subfunction;
