//! Collection names.

use std::fmt;

/// The five document collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    AllJobs,
    SomeJobs,
    Tasks,
    AddedJobs,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::AllJobs,
        Collection::SomeJobs,
        Collection::Tasks,
        Collection::AddedJobs,
    ];

    /// Name of the collection in the store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::AllJobs => "allJobs",
            Collection::SomeJobs => "SomeJobs",
            Collection::Tasks => "myTasks",
            Collection::AddedJobs => "myAddedJobs",
        }
    }

    /// Field matched by the `email` query parameter on list routes.
    ///
    /// Featured jobs have no owner filter.
    pub fn filter_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users | Collection::AllJobs | Collection::AddedJobs => Some("userEmail"),
            Collection::Tasks => Some("workerEmail"),
            Collection::SomeJobs => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
