use std::io::IsTerminal;

use super::FilterArgs;
use crate::browser::ChartBrowser;
use tencents::error::Result;
use tencents::session::Session;
use tencents::settings::load_settings;
use tencents::store;

pub fn run(filter: &FilterArgs) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        return super::report::run(filter, &[], false);
    }

    let settings = load_settings();
    let filters = filter.to_filters(&settings)?;
    let conn = store::open(&settings.data_path())?;

    let mut session = Session::new(settings.amount_policy(), settings.kind_filter())
        .with_transactions(store::load_transactions(&conn)?);
    session.set_filters(filters);

    ChartBrowser::new(session, settings.currency_label.clone()).run()
}
