use crate::scene::bytes::Cursor;
use crate::scene::{FieldCount, FieldSpec, PrimitiveKind, Result, Value};

/// One decoded payload field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field name from the registry layout.
	pub name: Box<str>,
	/// Decoded value.
	pub value: Value,
}

/// Decoded payload fields in stored order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFields {
	/// Fields that were present.
	pub fields: Vec<FieldValue>,
}

impl DecodedFields {
	/// Borrow a field value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|item| item.name.as_ref() == name).map(|item| &item.value)
	}

	/// Borrow a text field by name.
	pub fn text(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(Value::as_str)
	}

	/// Remove and return a field value by name.
	pub fn take(&mut self, name: &str) -> Option<Value> {
		let idx = self.fields.iter().position(|item| item.name.as_ref() == name)?;
		Some(self.fields.remove(idx).value)
	}
}

/// Decode payload fields in declared order.
///
/// Bytes left after the last field are ignored, so payloads written by newer versions with
/// appended fields still decode.
pub fn decode_fields(cursor: &mut Cursor<'_>, layout: &[FieldSpec]) -> Result<DecodedFields> {
	let mut out = DecodedFields {
		fields: Vec::with_capacity(layout.len()),
	};

	for spec in layout {
		let value = match spec.count {
			FieldCount::One => decode_one(cursor, spec.kind)?,
			FieldCount::Optional => {
				if cursor.remaining() == 0 {
					continue;
				}
				decode_one(cursor, spec.kind)?
			}
			FieldCount::Fixed(count) if spec.kind == PrimitiveKind::Bytes => Value::Bytes(cursor.read_bytes(count)?.to_vec()),
			FieldCount::Fixed(count) => {
				let mut values = Vec::with_capacity(count);
				for _ in 0..count {
					values.push(decode_one(cursor, spec.kind)?);
				}
				Value::Vector(values)
			}
			FieldCount::Rest if spec.kind == PrimitiveKind::Bytes => Value::Bytes(cursor.read_rest().to_vec()),
			FieldCount::Rest => {
				let mut values = Vec::new();
				while cursor.remaining() > 0 {
					values.push(decode_one(cursor, spec.kind)?);
				}
				Value::from_elements(values)
			}
		};

		out.fields.push(FieldValue {
			name: spec.name.clone(),
			value,
		});
	}

	Ok(out)
}

fn decode_one(cursor: &mut Cursor<'_>, kind: PrimitiveKind) -> Result<Value> {
	Ok(match kind {
		PrimitiveKind::U8 => Value::Int32(i32::from(cursor.read_u8()?)),
		PrimitiveKind::I16 => Value::Int32(i32::from(cursor.read_i16()?)),
		PrimitiveKind::I32 => Value::Int32(cursor.read_i32()?),
		PrimitiveKind::U32 => Value::Int64(i64::from(cursor.read_u32()?)),
		PrimitiveKind::I64 => Value::Int64(cursor.read_i64()?),
		PrimitiveKind::F32 => Value::Float32(cursor.read_f32()?),
		PrimitiveKind::F64 => Value::Float64(cursor.read_f64()?),
		PrimitiveKind::Bool => Value::Bool(cursor.read_u8()? != 0),
		PrimitiveKind::CString => text_value(cursor.read_cstring()?),
		PrimitiveKind::PString => text_value(cursor.read_pstring()?),
		PrimitiveKind::Chars => {
			let raw = cursor.read_rest();
			let end = raw.iter().rposition(|byte| *byte != 0).map_or(0, |idx| idx + 1);
			text_value(&raw[..end])
		}
		PrimitiveKind::Bytes => Value::Bytes(cursor.read_bytes(1)?.to_vec()),
	})
}

fn text_value(bytes: &[u8]) -> Value {
	Value::String(String::from_utf8_lossy(bytes).into_owned().into_boxed_str())
}
