mod logging;
mod ui;

use gettextrs::LocaleCategory;

const GETTEXT_PACKAGE: &str = "memorama";

fn main() -> glib::ExitCode {
    logging::init();

    gettextrs::setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = gettextrs::textdomain(GETTEXT_PACKAGE) {
        tracing::debug!(error = %err, "no translation domain");
    }
    if let Err(err) = gettextrs::bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        tracing::debug!(error = %err, "could not set translation codeset");
    }

    ui::app::run()
}
