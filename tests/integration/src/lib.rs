// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test_cli;
#[cfg(test)]
mod test_policy_edits;
#[cfg(test)]
mod test_scenarios;
#[cfg(test)]
mod test_secure_ops;

#[cfg(test)]
mod test {
    use pra_emulator::with_requester;
    use pra_emulator_periph::EmuPlatform;
    use pra_lib::PraClient;
    use simple_logger::SimpleLogger;
    use std::thread;

    pub fn init_logging() {
        let _ = SimpleLogger::new()
            .with_level(log::LevelFilter::Warn)
            .init();
    }

    /// Runs `f` as a requester on its own thread.
    ///
    /// Returns `Err` if the requester halted.
    pub fn in_requester_thread<R, F>(platform: &EmuPlatform, f: F) -> thread::Result<R>
    where
        R: Send,
        F: FnOnce(&PraClient<'_>) -> R + Send,
    {
        thread::scope(|s| {
            s.spawn(move || match with_requester(platform, f) {
                Ok(result) => result,
                Err(err) => panic!("requester could not start: {}", err),
            })
            .join()
        })
    }
}
