pub mod batch;
pub mod dispatch;
pub mod dry_run;
