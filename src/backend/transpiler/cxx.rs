use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// Self-contained runtime embedded at the top of every generated
/// translation unit. A `Value` is one of string, int32 or float; `+` and
/// `-` coerce across the three kinds.
pub const CPP_RUNTIME: &str = r#"#include <cstdint>
#include <cstdlib>
#include <iostream>
#include <sstream>
#include <string>

namespace cpm {

class Value {
   public:
    enum Tag { STR, INT, FLT };

   private:
    Tag tag;
    std::string str;
    int32_t int_value;
    float float_value;

    static float to_float_or_zero(const std::string& s) {
        const char* begin = s.c_str();
        char* end;
        float result = std::strtof(begin, &end);
        if (result == 0 || end - begin < (long)s.size()) {
            return 0;
        }
        return result;
    }

   public:
    Value() : tag(STR), int_value(0), float_value(0) {}
    Value(const char* s) : tag(STR), str(s), int_value(0), float_value(0) {}
    Value(const std::string& s) : tag(STR), str(s), int_value(0), float_value(0) {}
    Value(int32_t v) : tag(INT), int_value(v), float_value(0) {}
    Value(float v) : tag(FLT), int_value(0), float_value(v) {}

    std::string to_string() const {
        switch (tag) {
            case STR:
                return str;
            case INT: {
                std::ostringstream out;
                out << int_value;
                return out.str();
            }
            case FLT:
            default: {
                std::ostringstream out;
                out << float_value;
                return out.str();
            }
        }
    }

    Value operator+(const Value& other) const {
        if (tag == STR || other.tag == STR) {
            return Value(to_string() + other.to_string());
        }
        if (tag == INT && other.tag == INT) {
            return Value(int_value + other.int_value);
        }
        float lhs = tag == INT ? (float)int_value : float_value;
        float rhs = other.tag == INT ? (float)other.int_value : other.float_value;
        return Value(lhs + rhs);
    }

    Value operator-(const Value& other) const {
        if (tag == STR && other.tag == STR) {
            return Value("");
        }
        if (tag == STR && other.tag == INT) {
            return Value((int32_t)to_float_or_zero(str) - other.int_value);
        }
        if (tag == STR) {
            return Value(to_float_or_zero(str) - other.float_value);
        }
        if (other.tag == STR) {
            if (tag == INT) {
                return Value(int_value - (int32_t)to_float_or_zero(other.str));
            }
            return Value(float_value - to_float_or_zero(other.str));
        }
        if (tag == INT && other.tag == INT) {
            return Value(int_value - other.int_value);
        }
        float lhs = tag == INT ? (float)int_value : float_value;
        float rhs = other.tag == INT ? (float)other.int_value : other.float_value;
        return Value(lhs - rhs);
    }
};

inline Value input(const Value& prompt) {
    std::cout << prompt.to_string() << std::flush;
    std::string line;
    if (!std::getline(std::cin, line)) {
        line = "";
    }
    return Value(line);
}

inline void print(const Value& value) { std::cout << value.to_string() << std::endl; }

}  // namespace cpm

"#;

/// The C++ compiler to invoke, overridable for unusual toolchains.
pub fn compiler_command() -> String {
    std::env::var("CPMC_CXX").unwrap_or_else(|_| "c++".to_string())
}

pub fn write_temp_file(contents: &str, suffix: &str) -> Result<(PathBuf, PathBuf)> {
    let mut dir = std::env::temp_dir();
    dir.push("cpmc");
    fs::create_dir_all(&dir).context("Creating temp directory")?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let file_stem = format!("transpile_{nanos}");
    let source_path = dir.join(format!("{file_stem}.cpp"));
    let binary_path = dir.join(format!("{file_stem}{suffix}"));

    fs::write(&source_path, contents).context("Writing C++ source")?;
    Ok((source_path, binary_path))
}

pub fn compile_source(
    source: &str,
    suffix: &str,
    compile_error: &str,
) -> Result<(PathBuf, PathBuf)> {
    let (source_path, binary_path) = write_temp_file(source, suffix)?;
    compile_file(&source_path, &binary_path, compile_error)?;
    Ok((source_path, binary_path))
}

pub fn compile_file(source_path: &Path, binary_path: &Path, compile_error: &str) -> Result<()> {
    let compile = Command::new(compiler_command())
        .arg(source_path)
        .arg("-std=c++11")
        .arg("-O2")
        .arg("-o")
        .arg(binary_path)
        .output()
        .context("Running C++ compiler")?;
    if !compile.status.success() {
        let stderr = String::from_utf8_lossy(&compile.stderr);
        bail!("{compile_error}: {stderr}");
    }
    Ok(())
}

pub fn run_compiled_binary(binary_path: &Path, run_error: &str) -> Result<String> {
    let output = Command::new(binary_path)
        .output()
        .context("Running compiled program")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{run_error}: {stderr}");
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
