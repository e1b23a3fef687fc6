pub mod defenders;
pub mod forwarders;
pub mod goalkeepers;
pub mod midfielders;
pub mod processor;

pub use defenders::*;
pub use forwarders::*;
pub use goalkeepers::*;
pub use midfielders::*;
pub use processor::*;
