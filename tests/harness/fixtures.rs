//! Shell scripts standing in for the renderer.

/// Prints an SVG on stdout.
pub const STDOUT_TOOL: &str = r#"
echo 'rendering...' >&2
printf '<?xml version="1.0"?>\n<svg viewBox="0 0 4 3"><g/></svg>\ntrailing log\n'
"#;

/// Prints nothing useful on stdout; writes the SVG only to a real `-o` path.
pub const FILE_ONLY_TOOL: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ] && [ "$out" != "-" ]; then
  printf '<svg id="from-file"/>' > "$out"
  echo 'progress: <svg id="from-stdout"/>'
  exit 0
fi
echo 'stdout encoding unavailable'
exit 0
"#;

/// Fails on every attempt.
pub const BROKEN_TOOL: &str = r#"
echo "error: unknown module in $(basename "$1")" >&2
exit 2
"#;

/// Prints its own arguments and the first line of the input file inside an SVG.
pub const ECHO_TOOL: &str = r#"
last=""
for arg in "$@"; do last="$arg"; done
printf '<svg><desc>%s</desc><text>%s</text></svg>' "$*" "$(head -n 1 "$last")"
"#;

/// Writes a 4 KiB SVG to the `-o` path and nothing to stdout.
pub const LARGE_FILE_TOOL: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ] && [ "$out" != "-" ]; then
  { printf '<svg>'; head -c 4096 /dev/zero | tr '\0' ' '; printf '</svg>'; } > "$out"
fi
exit 0
"#;

/// Hangs past any short timeout while a background job writes the `-o` path late.
pub const LATE_WRITER_TOOL: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ] && [ "$out" != "-" ]; then
  ( sleep 0.6; printf '<svg/>' > "$out" ) >/dev/null 2>&1 &
fi
sleep 5
"#;
