pub(crate) mod account;
pub(crate) mod args;
pub(crate) mod orgs;
pub(crate) mod output;
pub(crate) mod repos;
