pub mod common;
pub mod distance;
pub mod measure;

pub use common::CommonView;
pub use distance::{
    Affinity, Cosine, Euclidean, GraphJaccard, Jaccard, Manhattan, Minkowski, Orientation,
    PairMeasure,
};
pub use measure::{Measure, UnknownMeasure};
