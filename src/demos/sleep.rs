//! Sequential against joined execution.
//!
//! `repeat sleep sleep sleep` takes three naps in a row, while
//! `parallel sleep sleep sleep` takes them all at once. Requires a `tokio`
//! runtime with the time driver enabled.

use std::time::Duration;

use tokio::time::sleep;

use crate::expr::{constant_async, Dispatch, Func, Parallel, Repeat, Type};
use crate::language::Language;

pub fn language(nap: Duration) -> Language<String> {
    let nap_type = constant_async("sleep", move || async move {
        sleep(nap).await;
        Ok(())
    })
    .into_type();

    let run = Type::new(
        "run",
        Dispatch::new()
            .funct(
                Func::new("repeat")
                    .arg(Repeat::new(&nap_type))
                    .exec(|naps: Vec<()>| format!("{} naps in a row", naps.len())),
            )
            .funct(
                Func::new("parallel")
                    .arg(Parallel::new(&nap_type))
                    .exec(|naps: Vec<()>| format!("{} naps at once", naps.len())),
            ),
    );
    Language::new("sleep", run)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const NAP: Duration = Duration::from_millis(40);

    #[tokio::test]
    async fn parallel_naps_overlap() {
        let lang = language(NAP);
        let program = ["parallel", "sleep", "sleep", "sleep", "sleep"];

        let started = Instant::now();
        let message = lang.run(program).await.unwrap();
        assert_eq!(message, "4 naps at once");
        assert!(started.elapsed() < NAP * 4);
    }

    #[tokio::test]
    async fn repeated_naps_add_up() {
        let lang = language(NAP);
        let program = ["repeat", "sleep", "sleep", "sleep"];

        let started = Instant::now();
        let message = lang.run(program).await.unwrap();
        assert_eq!(message, "3 naps in a row");
        assert!(started.elapsed() >= NAP * 3);
    }
}
