use crate::config::PageFormat;
use meterdash::{
	render::{Notice, Page, Redraw, Render},
	session::Session,
};
use std::io::Write;

/// Prints the dashboard page to stdout after every change.
pub struct ConsoleRender<W> {
	out: W,
	format: PageFormat,
	last: Option<Vec<String>>,
}

impl ConsoleRender<std::io::Stdout> {
	pub fn stdout(format: PageFormat) -> Self {
		Self::new(std::io::stdout(), format)
	}
}

impl<W: Write> ConsoleRender<W> {
	pub fn new(out: W, format: PageFormat) -> Self {
		Self {
			out,
			format,
			last: None,
		}
	}

	fn write_page(&mut self, page: &Page) -> anyhow::Result<()> {
		match self.format {
			PageFormat::Text => {
				writeln!(self.out)?;
				for line in &page.lines {
					writeln!(self.out, "{line}")?;
				}
			}
			PageFormat::Json => {
				serde_json::to_writer(&mut self.out, page)?;
				writeln!(self.out)?;
			}
		}
		self.out.flush()?;
		Ok(())
	}
}

impl<W: Write + Send> Render for ConsoleRender<W> {
	fn redraw(&mut self, session: &Session, redraw: Redraw) {
		let page = Page::from_session(session);

		// Unchanged pages are only printed again after a history load.
		if redraw == Redraw::Incremental && self.last.as_ref() == Some(&page.lines) {
			return;
		}

		tracing::trace!("generated page: {page:?}");
		if let Err(error) = self.write_page(&page) {
			tracing::error!("error writing dashboard page: {error}");
		}
		self.last = Some(page.lines);
	}

	fn notify(&mut self, notice: Notice) {
		match notice {
			Notice::RelayConfirmed { .. } | Notice::PriceUpdated(_) => tracing::info!("{notice}"),
			_ => tracing::warn!("{notice}"),
		}
		if let Err(error) = writeln!(self.out, "> {notice}") {
			tracing::error!("error writing notice: {error}");
		}
	}
}
