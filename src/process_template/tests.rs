use std::{fs, io, path::Path};

use super::*;

macro_rules! testlist {
    ($($name:ident,)*) => {
    $(
        #[test]
        fn $name() {
            run_test(stringify!($name))
        }
    )*
    }
}

testlist! {
    attribute_mixed,
    bad_data,
    bad_markup,
    comment_inert,
    escaping,
    hello_update,
    list_index,
    malformed_placeholder,
    missing_field,
    no_data,
    scalars,
}

fn run_test(name: &str) {
    let rootdir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let test_data_dir = rootdir.join("src/process_template/tests/testdata");

    let test_file = test_data_dir.join(format!("tests/{}.txt", name));
    let test_data_file = test_data_dir.join(format!("tests/{}-data.txt", name));
    let expected_file = test_data_dir.join(format!("expected/{}.txt", name));
    let actual_dir = test_data_dir.join("actual");
    let actual_file = actual_dir.join(format!("{}.txt", name));

    let test = fs::read_to_string(&test_file).unwrap();
    let test_data = fs::read_to_string(&test_data_file);
    let test_data = match test_data {
        Ok(test_data) => test_data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => "".to_string(),
        _ => test_data.unwrap(),
    };

    let result = render_template_str(test.trim_end(), &test_data);
    let actual = format_result(result);

    fs::create_dir_all(actual_dir).unwrap();
    fs::write(actual_file, &actual).unwrap();

    let expected = fs::read_to_string(expected_file).unwrap();
    assert_eq!(expected, actual);
}

fn format_result(result: Result<String, Error>) -> String {
    let mut string = String::new();

    string.push_str("ERROR: ");
    let output = match result {
        Ok(output) => output,
        Err(err) => {
            string.push_str(&err.to_string());
            return string;
        }
    };

    string.push_str("<None>\n");
    string.push_str("OUTPUT:\n");
    string.push_str(&output);
    string
}
