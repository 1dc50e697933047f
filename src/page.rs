use keepframe_common::{FrameEncoding, KEY_SLOTS};

/// Page served on `GET /`.
///
/// It keeps one flag per key code, posts the flags as the body of every
/// request and paints each response as a `width * height` RGBA frame the
/// moment it arrives.
pub fn bootstrap_document(width: usize, height: usize, encoding: FrameEncoding) -> String {
    let read_frame = match encoding {
        FrameEncoding::Raw => "await res.arrayBuffer()",
        FrameEncoding::Json => "await res.json()",
    };

    format!(
        r#"<!DOCTYPE html>
<canvas width="{width}" height="{height}"></canvas>
<script>
  const keys = Array({KEY_SLOTS}).fill(0);
  onkeydown = (e) => keys[e.keyCode] = 1;
  onkeyup = (e) => keys[e.keyCode] = 0;
  onload = async () => {{
    const ctx = document.querySelector("canvas").getContext("2d");
    while (true) {{
      const res = await fetch("/", {{ method: "POST", body: keys.join("") }});
      const pixels = new Uint8ClampedArray({read_frame});
      ctx.putImageData(new ImageData(pixels, {width}), 0, 0);
    }}
  }};
</script>
"#
    )
}
