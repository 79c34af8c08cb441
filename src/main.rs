// SPDX-License-Identifier: MPL-2.0
use iced_muse::app::{self, Flags};

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    let flags = Flags {
        category: args.opt_value_from_str("--category").unwrap_or(None),
        source: args.opt_value_from_str("--source").unwrap_or(None),
    };

    app::run(flags)
}
