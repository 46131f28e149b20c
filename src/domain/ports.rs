use crate::utils::error::Result;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the playbook text comes from; read fresh on every render.
pub trait InputSource {
    fn read_text(&self) -> Result<String>;
}

/// Where rendered markup goes. Every write replaces the previous content wholesale.
pub trait OutputSink {
    fn replace(&self, content: &str) -> Result<()>;

    fn show_error(&self, message: &str) -> Result<()> {
        self.replace(&error_block(message))
    }
}

pub trait MarkupRenderer {
    fn render(&self, input: &str) -> Result<String>;
}

impl<F> MarkupRenderer for F
where
    F: Fn(&str) -> Result<String>,
{
    fn render(&self, input: &str) -> Result<String> {
        self(input)
    }
}

pub fn error_block(message: &str) -> String {
    format!("<pre style=\"color: red;\">Error: {}</pre>", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Buffer(RefCell<String>);

    impl OutputSink for Buffer {
        fn replace(&self, content: &str) -> Result<()> {
            *self.0.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    #[test]
    fn test_default_show_error_wraps_message() {
        let sink = Buffer(RefCell::new("<svg></svg>".to_string()));
        sink.show_error("Parse error at 1:1: boom").unwrap();
        assert_eq!(
            *sink.0.borrow(),
            "<pre style=\"color: red;\">Error: Parse error at 1:1: boom</pre>"
        );
    }

    #[test]
    fn test_closures_are_renderers() {
        let upper = |input: &str| -> Result<String> { Ok(input.to_uppercase()) };
        assert_eq!(upper.render("svg").unwrap(), "SVG");
    }
}
