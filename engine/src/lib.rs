//! Worker execution and consumer-thread delivery for tdnet.
//!
//! Triggers on the consumer thread start one-shot worker tasks. Workers never
//! touch consumer state: each posts exactly one [`tdnet_types::CompletionMessage`]
//! into the delivery queue, and the consumer applies it when it drains.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `runner` | `TaskRunner`: run an operation on the runtime, deliver its outcome |
//! | `delivery` | `DeliveryQueue` / `DeliverySender`: the multi-producer hand-off |
//! | `connectivity` | `Connectivity` gate consulted before a fetch starts |
//! | `state` | Consumer-owned display fields and task phase tracking |
//! | `notifications` | Transient messages raised by declined triggers |
//! | `app` | `App`: ties triggers, gate, runner and queue together |

mod app;
mod connectivity;
mod delivery;
mod notifications;
mod runner;
mod state;

pub use app::{App, Collaborators};
pub use connectivity::{Connectivity, FixedConnectivity, RouteConnectivity};
pub use delivery::{CompletionSink, DEFAULT_DRAIN_BUDGET, DeliveryQueue, DeliverySender};
pub use notifications::Notification;
pub use runner::TaskRunner;
pub use state::{ConsumerState, TaskTracker};

pub use tdnet_fetch::{FetchConfig, ResolvedConfig};
pub use tdnet_types::{
    CompletionMessage, FetchError, ImageBitmap, Payload, TaskId, TaskPhase, Target, TextContent,
};
