//! AWS Identity and Access Management (IAM) SDK for Rust.
//!
//! A blocking client for the IAM Query API. Every operation is one method
//! on [`Client`] taking a typed request and returning a typed result:
//!
//! - Users, groups, roles and instance profiles
//! - Managed and inline policies, attachments, versions
//! - Access keys and SSH public keys
//! - Account summary, aliases and credential reports
//! - Policy simulation
//!
//! Operations that are not built in can be sent through [`Client::invoke`]
//! by implementing [`Operation`].
//!
//! # Quick Start
//!
//! ```no_run
//! use rs_aws_iam::{Client, CreateUserRequest, Credential};
//!
//! # fn example() -> rs_aws_iam::Result<()> {
//! let client = Client::new(Credential::new("your-access-key-id", "your-secret-access-key"))?;
//!
//! let resp = client.create_user(CreateUserRequest::new("bob"))?;
//! println!("Created {}", resp.user.arn);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Failures fall in two families. [`IamError::Service`] means IAM received
//! and rejected the request; its [`ServiceErrorKind`] names the reason.
//! Every other variant means the call never produced a usable response.
//!
//! ```no_run
//! use rs_aws_iam::{Client, Credential, GetUserRequest, ServiceErrorKind};
//!
//! # fn example(client: &Client) {
//! match client.get_user(GetUserRequest::new("bob")) {
//!     Ok(resp) => println!("{}", resp.user.user_id),
//!     Err(err) if err.service_error_kind() == Some(ServiceErrorKind::NoSuchEntity) => {
//!         println!("no such user")
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod metrics;
pub mod model;
pub mod operation;
pub mod transport;

mod exec;
mod request;
mod response;
mod sign;

pub use client::Client;
pub use config::ClientConfig;
pub use credential::{Credential, CredentialProvider, StaticProvider};
pub use error::{ErrorType, IamError, Result, ServiceError, ServiceErrorKind};
pub use metrics::{MetricsCollector, RequestMetrics};
pub use model::*;
pub use operation::{OPERATION_NAMES, Operation, WithCredentials};
pub use request::{QueryEntry, QueryParams};
pub use response::{ResponseMetadata, unmarshal_result};
pub use transport::{ReqwestTransport, Transport};

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<IamError>;
    let _ = assert_send_sync::<Credential>;
};
