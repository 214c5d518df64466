pub mod chart;
pub mod consts;
pub mod derive;
pub mod design;
pub mod error;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod reconstruct;
pub mod reduce;
pub mod regression;
pub mod select;
