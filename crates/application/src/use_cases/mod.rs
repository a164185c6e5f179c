pub mod secondary;

pub use secondary::{
    FirstResponder, HandleNotifyUseCase, PersistRecordsUseCase, ProbePrimariesUseCase,
    SecondaryTopology, SyncOutcome, TransferZoneUseCase,
};
