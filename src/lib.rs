//! fvdkit - Force Vector Design core for roller coaster track geometry.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Physics/math primitives (Float3, Frame, Node, TrackParams)
//! - **persistence**: Byte-reversed binary codec primitives and decode errors
//! - **function**: Piecewise transition functions (Subfunction, Function)
//! - **section**: Section contract and the curved-section integrator
//! - **track**: Ordered sections and their node lists
//!
//! # Usage
//!
//! ```
//! use fvdkit::{CurvedSection, Float3, Node, Track, TrackParams};
//!
//! let params = TrackParams::default();
//! let anchor = Node::anchor(Float3::new(0.0, 3.0, 0.0), 0.0, 10.0, &params);
//! let mut track = Track::new(anchor, params);
//! track.push_section(Box::new(CurvedSection::new(90.0, 20.0)));
//! assert!(track.num_points(None) > 1);
//! ```

pub mod function;
pub mod persistence;
pub mod section;
pub mod sim;
pub mod track;

pub use function::{Degree, DegreeKind, FuncType, Function, Subfunction};
pub use section::{CurvedSection, Section};
pub use sim::{Float3, Frame, Node, Quaternion, TrackParams};
pub use track::Track;
