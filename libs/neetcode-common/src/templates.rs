// Starter code shown in the editor for each language.
//
// Python and JavaScript templates follow the `Solution.solve(args)` convention;
// the matching driver lives in `driver.rs`. The compiled languages are plain
// stdin/stdout programs.

use crate::types::Language;

const PYTHON: &str = r#"class Solution:
    def solve(self, args):
        """
        :param args: list - Contains the input values
        :return: The result of your calculation

        Usage:
        - args[0] is the first input, args[1] is the second, etc.
        - Do NOT use input(). We handle reading for you.
        - Return your answer. Do NOT print() it.
        """

        # Example: For 'Sum of Two Numbers' (Input: 3 5)
        # val1 = int(args[0])
        # val2 = int(args[1])
        # return val1 + val2

        return None"#;

const JAVASCRIPT: &str = r#"class Solution {
    /**
     * @param {any[]} args - The input arguments from the test case
     * @returns {any} - The result
     */
    solve(args) {
        // Usage:
        // - args[0] is the first input line.
        // - Do NOT use process.stdin. We handle it.
        // - Return the result.

        // Example:
        // const num = parseInt(args[0]);
        // return num % 2 === 0 ? "Even" : "Odd";

        return null;
    }
}"#;

const JAVA: &str = r#"// Java Solution
import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner scanner = new Scanner(System.in);

        // 1. Read Input
        // int a = scanner.nextInt();

        // 2. Process logic...

        // 3. Print Output
        // System.out.println(a);

        scanner.close();
    }
}"#;

const CPP: &str = r#"// C++ Solution
#include <iostream>
#include <vector>
#include <string>
#include <algorithm>

using namespace std;

int main() {
    ios::sync_with_stdio(0);
    cin.tie(0);

    // 1. Read Input
    // int a;
    // cin >> a;

    // 2. Process logic...

    // 3. Print Output
    // cout << a;

    return 0;
}"#;

const C: &str = r#"// C Solution
#include <stdio.h>
#include <stdlib.h>

int main() {
    // 1. Read Input
    // int a;
    // scanf("%d", &a);

    // 2. Process logic...

    // 3. Print Output
    // printf("%d", a);

    return 0;
}"#;

/// Shown once to new users.
pub const INPUT_HELP: &str = "How inputs work:\n\
    For Python/JS, we use a hidden wrapper.\n\
    Use the `args` variable to access inputs.\n\
    Do NOT read standard input manually.";

/// Starter snippet for a language. TypeScript has none.
pub fn template(language: Language) -> Option<&'static str> {
    match language {
        Language::Python => Some(PYTHON),
        Language::JavaScript => Some(JAVASCRIPT),
        Language::Java => Some(JAVA),
        Language::Cpp => Some(CPP),
        Language::C => Some(C),
        Language::TypeScript => None,
    }
}

/// Editor contents after switching to `language`: its template, or the current
/// code when the language has no template.
pub fn switch_language(current_code: &str, language: Language) -> String {
    template(language)
        .map(str::to_string)
        .unwrap_or_else(|| current_code.to_string())
}
