mod priority;
mod round_robin;
mod simple;

pub use priority::Priority;
pub use round_robin::RoundRobin;
pub use simple::Simple;
