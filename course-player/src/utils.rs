pub mod aborting_join_handle;
#[cfg(test)]
pub mod fake_course_api;
#[cfg(test)]
pub mod fake_media_source;
#[cfg(test)]
pub mod test_server;
pub mod timer;
