//! Two threads logging through independently forked loggers.

use fastlog::{Logger, Sink};
use std::thread;

fn main() {
    let sink = Sink::stderr();
    let mut logger = Logger::root(sink);

    let mut worker = logger.with("thread", 1_i64).fork();
    let t1 = thread::spawn(move || {
        worker.info("in thread 1.");
    });

    for _ in 0..10 {
        logger.info("halo");
    }
    t1.join().expect("worker thread panicked");
}
