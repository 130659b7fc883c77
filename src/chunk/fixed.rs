/// A positional group of lines.
///
/// Always holds exactly `stride` fields; fields past the end of the input
/// are empty strings. `present` counts the fields that came from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
    present: usize,
}

impl Record {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `i`, or "" when the record is shorter.
    pub fn field(&self, i: usize) -> &str {
        self.fields.get(i).map(String::as_str).unwrap_or("")
    }

    pub fn present(&self) -> usize {
        self.present
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// Split `lines` into records of `stride` consecutive lines.
///
/// The final record may be short; its missing fields are padded with "".
///
/// # Panics
/// If `stride` is zero. Configuration is validated before reaching here.
pub fn chunk_fixed<S: AsRef<str>>(lines: &[S], stride: usize) -> Vec<Record> {
    assert!(stride > 0, "stride must be positive");

    lines
        .chunks(stride)
        .map(|group| {
            let mut fields: Vec<String> = group.iter().map(|l| l.as_ref().to_string()).collect();
            let present = fields.len();
            fields.resize(stride, String::new());
            Record { fields, present }
        })
        .collect()
}
