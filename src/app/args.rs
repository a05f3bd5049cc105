//! Builds the renderer's argument vector from config and options.
//!
//! Only non-default options produce flags, so leaving a flag out always means
//! "the renderer's own default". Values are not validated here: the renderer
//! decides what is legal.

use std::fmt::Display;
use std::path::Path;

use crate::domain::{RenderConfig, RenderOptions};

const OUTPUT_FLAGS: [&str; 2] = ["-o", "--output"];
const STDOUT_MARKER: &str = "-";

/// Flags derived from `options`, in a fixed order.
pub fn option_flags(options: &RenderOptions) -> Vec<String> {
    let defaults = RenderOptions::default();
    let mut flags = Vec::new();

    push_choice(
        &mut flags,
        "--input-order",
        options.input_order,
        defaults.input_order,
    );
    push_choice(&mut flags, "--style", options.theme, defaults.theme);
    push_choice(
        &mut flags,
        "--orientation",
        options.orientation,
        defaults.orientation,
    );
    push_count(&mut flags, "--grid-x", options.grid_x);
    push_count(&mut flags, "--grid-y", options.grid_y);
    push_switch(&mut flags, "--no-symmetry", options.no_symmetry);
    push_switch(&mut flags, "--fanout-wires", options.fanout_wires);
    push_switch(&mut flags, "--no-clock-triangle", options.no_clock_triangle);
    push_switch(&mut flags, "--no-caption", options.no_caption);
    push_switch(&mut flags, "--show-types", options.show_types);
    push_switch(&mut flags, "--table", options.table);

    flags
}

fn push_choice<T: PartialEq + Display>(flags: &mut Vec<String>, flag: &str, value: T, default: T) {
    if value != default {
        flags.push(flag.to_string());
        flags.push(value.to_string());
    }
}

fn push_count(flags: &mut Vec<String>, flag: &str, value: u32) {
    if value > 0 {
        flags.push(flag.to_string());
        flags.push(value.to_string());
    }
}

fn push_switch(flags: &mut Vec<String>, flag: &str, enabled: bool) {
    if enabled {
        flags.push(flag.to_string());
    }
}

/// `[subcommand, options…, extra…, path]`, or path first when
/// `args_before_path` is off. Runner arguments are not included.
pub fn build_args(config: &RenderConfig, path: &Path, options: &RenderOptions) -> Vec<String> {
    let mut args = Vec::new();
    if !config.subcommand.is_empty() {
        args.push(config.subcommand.clone());
    }

    let path = path.to_string_lossy().into_owned();
    let mut derived = option_flags(options);
    derived.extend(config.extra_args.iter().cloned());

    if config.args_before_path {
        args.extend(derived);
        args.push(path);
    } else {
        args.push(path);
        args.extend(derived);
    }

    args
}

/// Points every stdout output marker (`-o -`, `--output -`, `--output=-`) at
/// `output`. Appends `-o <output>` when there is none.
pub fn rewrite_output_target(args: &[String], output: &Path) -> Vec<String> {
    let output = output.to_string_lossy().into_owned();
    let mut rewritten = Vec::with_capacity(args.len() + 2);
    let mut replaced = false;
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        if OUTPUT_FLAGS.contains(&arg.as_str())
            && iter.peek().is_some_and(|next| *next == STDOUT_MARKER)
        {
            iter.next();
            rewritten.push(arg.clone());
            rewritten.push(output.clone());
            replaced = true;
        } else if arg == "--output=-" {
            rewritten.push(format!("--output={}", output));
            replaced = true;
        } else {
            rewritten.push(arg.clone());
        }
    }

    if !replaced {
        rewritten.push("-o".to_string());
        rewritten.push(output);
    }

    rewritten
}
