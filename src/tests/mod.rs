//! Native test support for the playback health core: in-memory fakes for the
//! playback source and the timer scheduler, plus the scenario tests.

mod fakes;
mod registry_tests;
