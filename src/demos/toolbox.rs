//! File commands with asynchronous handlers.
//!
//! ```text
//! writeFile out.txt join , a b c -
//! writeFile copy.txt readFile out.txt
//! ```

use tokio::fs;

use crate::expr::{Dispatch, Func, Primitives, Repeat, Type};
use crate::language::Language;

pub fn language() -> Language<String> {
    let prims = Primitives::standard();
    let words = Repeat::with_exit(&prims.string, "-");

    let source = Type::new(
        "source",
        Dispatch::new()
            .funct(
                Func::new("readFile")
                    .arg(&prims.string)
                    .exec_async(|path: String| async move { Ok(fs::read_to_string(path).await?) }),
            )
            .funct(Func::new("token").arg(&prims.string).exec(|s: String| s))
            .funct(
                Func::new("join")
                    .arg(&prims.string)
                    .arg(&words)
                    .exec(|by: String, parts: Vec<String>| parts.join(&by)),
            ),
    );

    let command = Type::new(
        "command",
        Dispatch::new().funct(
            Func::new("writeFile")
                .arg(&prims.string)
                .arg(&source)
                .exec_async(|path: String, content: String| async move {
                    fs::write(&path, &content).await?;
                    Ok(format!("wrote {} bytes to {path}", content.len()))
                }),
        ),
    );

    Language::new("toolbox", command)
}
