//! Literal markup contract for bundle inclusion and inline data blocks.

/// Render the inclusion tag referencing an aggregated bundle.
pub fn include_tag(cache_url: &str, filename: &str, async_hint: bool) -> String {
  format!(
    "<script type='text/javascript' src='{cache_url}{filename}'{}></script>",
    if async_hint { " async" } else { "" }
  )
}

/// Wrap minified inline data in an immediately executed script block.
///
/// The CDATA markers keep the block valid when the page is served as XHTML;
/// HTML5 parsers treat them as a plain comment.
pub fn inline_block(data: &str) -> String {
  format!("<script type='text/javascript'>\n/* <![CDATA[ */\n{data}\n/* ]]> */\n</script>\n")
}
