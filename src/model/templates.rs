//! Starter source text per language.
//!
//! Static, read-only, process-wide. Selecting a language replaces the
//! buffer with its template wholesale.

use super::language::Language;

pub const fn template(language: Language) -> &'static str {
    match language {
        Language::JavaScript => {
            r#"// Core Runner v2.6
// Neat, clean, efficient.

function processData(input) {
  console.log("Processing stream: " + input);
  return input.split('').reverse().join('');
}

const result = processData("Aether Studio");
console.log("Result:", result);"#
        }
        Language::Python => {
            r#"# Python 3.10
def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n-1) + fibonacci(n-2)

print("Calculating sequence...")
for i in range(10):
    print(f"Fib({i}) = {fibonacci(i)}")"#
        }
        Language::TypeScript => {
            r#"// TypeScript Strict
interface User {
  id: number;
  role: 'admin' | 'user';
}

const currentUser: User = {
  id: 42,
  role: 'admin'
};

console.log(`User ${currentUser.id} authorized.`);"#
        }
        Language::Html => {
            r#"<!-- Live Preview -->
<div class="card">
  <h2>Neat Design</h2>
  <button>Click Me</button>
</div>"#
        }
        Language::Css => {
            r#"/* Minimal Style */
body {
  display: flex;
  justify-content: center;
  align-items: center;
  height: 100vh;
  background: transparent;
  color: white;
  font-family: sans-serif;
}

.card {
  background: rgba(255,255,255,0.1);
  padding: 40px;
  border-radius: 20px;
  border: 1px solid rgba(255,255,255,0.1);
  backdrop-filter: blur(10px);
}

button {
  background: #3b82f6;
  border: none;
  padding: 10px 20px;
  border-radius: 8px;
  color: white;
  margin-top: 15px;
  cursor: pointer;
}"#
        }
        Language::Sql => {
            r#"-- Database Query
SELECT name, email
FROM users
WHERE status = 'active'
LIMIT 5;"#
        }
        Language::Cpp => {
            r#"// System Core
#include <iostream>

int main() {
    std::cout << "System initialized." << std::endl;
    return 0;
}"#
        }
    }
}
