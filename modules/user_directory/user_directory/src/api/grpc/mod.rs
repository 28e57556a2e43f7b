//! gRPC surface of the user directory.

mod server;

pub use server::UserServiceImpl;
