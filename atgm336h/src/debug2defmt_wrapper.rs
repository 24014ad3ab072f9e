use core::fmt;

/// Lets values that only implement `Debug` (transport errors of arbitrary
/// HALs) go through the `log_*` macros when the `defmt` backend is active.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Debug2DefmtWrapper<T: fmt::Debug>(
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))] pub T,
);
