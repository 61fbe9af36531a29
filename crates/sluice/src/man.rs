//! Reference-manual generation
//!
//! Renders an RST document describing the CLI and every registered
//! component type. The raw RST is readable on its own but is primarily
//! meant for `rst2man`:
//!
//! ```bash
//! sluice --make-man > sluice.rst && rst2man < sluice.rst > sluice.1
//! ```

use std::fmt::Write;

use sluice_config::Registries;

const HEADER: &str = r#"======
sluice
======

------
Sluice
------

:Manual section: 1

SYNOPSIS
========

::

    sluice -f config-file [--show]

    sluice [--help | --show | --make-man]

DESCRIPTION
===========

Sluice is a generic tool for moving metric data around. It serves as a
framework for building bridges between data collectors and storage
engines: accept data somewhere, parse it, massage its metadata and data
fields, then hand it on - batched, duplicated, or with fallbacks -
to wherever it needs to go.

A pipeline has three core component kinds:

1. Receivers acquire raw data
2. Handlers turn raw data into meaningful content
3. Senders determine what happens to the data

A single instance must have at least one receiver, and typically at
least one handler and sender.

Senders come in two interchangeable variants: storage-oriented senders
deliver data to an external resource, utility-oriented senders add
logic, such as error handling or duplication, on top of other senders.

CONFIGURATION
=============

Configuration is a single JSON document, referenced with the -f option:

::

  {
    "receivers": { "name": { "type": "...", ...options } },
    "handlers":  { "name": { "parser": "json",
                             "transformers": ["..."],
                             "sender": "name-of-sender" } },
    "transformers": { "name": { "type": "...", ...options } },
    "senders":   { "name": { "type": "...", ...options } }
  }

Names are arbitrary and are how entries reference each other across
sections. The "type" field selects the implementation; each
implementation has its own options. Multiple receivers may share a
handler and multiple senders may reference the same sender. It is up to
the operator to avoid setting up feedback loops.

The "templater" transformer has no settings and does not need to be
defined to be referenced.

Upon start-up, all receivers are started.

"#;

/// Render the full reference document.
pub fn render(registries: &Registries) -> String {
    let mut out = String::from(HEADER);

    section(&mut out, "RECEIVERS", "The following receivers exist.");
    for name in registries.receivers.available_types() {
        entry(&mut out, name, registries.receivers.help(name));
    }

    section(&mut out, "TRANSFORMERS", "The following transformers exist.");
    for name in registries.transformers.available_types() {
        entry(&mut out, name, registries.transformers.help(name));
    }

    section(&mut out, "SENDERS", "The following senders exist.");
    for name in registries.senders.available_types() {
        entry(&mut out, name, registries.senders.help(name));
    }

    out.push_str(
        "PARSERS\n=======\n\njson\n----\n\n\
         Parse the reference JSON container format: an optional template\n\
         metric and a required, non-empty metrics array.\n",
    );
    out
}

fn section(out: &mut String, title: &str, intro: &str) {
    let _ = write!(out, "{}\n{}\n\n{}\n\n", title, "=".repeat(title.len()), intro);
}

fn entry(out: &mut String, name: &str, help: Option<&str>) {
    let _ = write!(
        out,
        "{}\n{}\n\n{}\n\n",
        name,
        "-".repeat(name.len()),
        help.unwrap_or("Undocumented.")
    );
}
