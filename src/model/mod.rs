//! In-memory record stores, views and input history

mod book;
mod filter;
mod history;
mod notifier;
mod sample;
mod snapshot;
mod store;
mod unique_list;
mod view;

pub use book::{Collection, RecordBook, RemovedEmployee};
pub use filter::{KeywordMatch, Predicate, SortOrder};
pub use history::InputHistory;
pub use notifier::{ChangeEvent, ChangeNotifier, SubscriptionId};
pub use sample::sample_snapshot;
pub use snapshot::BookSnapshot;
pub use store::{ClaimStore, EmployeeStore, EntityStore, PostingStore, ScheduleStore};
pub use unique_list::{StoreError, UniqueList};
pub use view::FilteredView;
