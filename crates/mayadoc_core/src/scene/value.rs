/// Attribute value shared by the binary and ASCII decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// 32-bit signed integer.
	Int32(i32),
	/// 64-bit signed integer.
	Int64(i64),
	/// Single-precision float.
	Float32(f32),
	/// Double-precision float.
	Float64(f64),
	/// Boolean.
	Bool(bool),
	/// Text.
	String(Box<str>),
	/// Opaque bytes.
	Bytes(Vec<u8>),
	/// Ordered elements of an array, tuple, or matrix.
	Vector(Vec<Value>),
}

impl Value {
	/// Stable lowercase label for the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Int32(_) => "int32",
			Self::Int64(_) => "int64",
			Self::Float32(_) => "float32",
			Self::Float64(_) => "float64",
			Self::Bool(_) => "bool",
			Self::String(_) => "string",
			Self::Bytes(_) => "bytes",
			Self::Vector(_) => "vector",
		}
	}

	/// Borrow text content.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Widen numeric content to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int32(value) => Some(f64::from(*value)),
			Self::Int64(value) => Some(*value as f64),
			Self::Float32(value) => Some(f64::from(*value)),
			Self::Float64(value) => Some(*value),
			_ => None,
		}
	}

	/// Collapse a single-element vector into its element.
	pub(crate) fn from_elements(mut values: Vec<Value>) -> Value {
		if values.len() == 1 {
			values.pop().unwrap_or(Value::Vector(Vec::new()))
		} else {
			Value::Vector(values)
		}
	}
}
