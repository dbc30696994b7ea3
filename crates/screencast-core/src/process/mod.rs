mod probe;
mod quit_budget;
mod stop_handle;
mod supervisor;

pub(crate) use {quit_budget::QuitBudget, stop_handle::ProcessControl};

pub use {
    probe::probe_encoder,
    quit_budget::{MAX_QUIT_ATTEMPTS, StopAction},
    stop_handle::StopHandle,
    supervisor::{EncoderEvent, EncoderSupervisor},
};
