mod handle_notify;
mod persist_records;
mod probe_primaries;
mod selection;
mod topology;
mod transfer_zone;

pub use handle_notify::{should_transfer, HandleNotifyUseCase, SyncOutcome};
pub use persist_records::{PersistRecordsUseCase, PersistReport};
pub use probe_primaries::{PrimarySoa, ProbeOutcome, ProbePrimariesUseCase};
pub use selection::{FirstResponder, PrimarySelectionStrategy};
pub use topology::SecondaryTopology;
pub use transfer_zone::{TransferOutcome, TransferZoneUseCase};
