//! End-to-end tour: layouts over loose values, a user type carrying its own
//! codec, and the same byte format flowing through a file and back.
use {
    spancode::{
        compound,
        io::{IoReader, IoWriter},
        HeapSerializer, Layout,
    },
    std::{
        collections::BTreeSet,
        fs::File,
        io::{BufReader, BufWriter},
    },
};

// A layout usable anywhere a sink is available.
type MyLayout = Layout<(Vec<String>, [f32; 12], i64)>;

#[derive(Debug, PartialEq)]
struct WeirdObject {
    names: Vec<String>,
    heights: [f32; 12],
    measurements: i64,
}

// The object's codec is an inner layout over its fields.
compound! {
    WeirdObject {
        names: Vec<String>,
        heights: [f32; 12],
        measurements: i64,
    }
}

fn main() -> spancode::Result<()> {
    let names = vec!["ann".to_string(), "joseph".to_string(), "catherine".to_string()];
    let heights = [2.0f32, 3.0, 5.0, 7.0, 11.0, 13.0, 17.0, 23.0, 29.0, 31.0, 37.0, 43.0];
    let measurements = 1234i64;

    let weird = WeirdObject {
        names: names.clone(),
        heights,
        measurements,
    };

    let path = std::env::temp_dir().join("spancode_usage.bin");

    {
        let mut file = IoWriter::new(BufWriter::new(File::create(&path)?));

        // Write a previously defined layout.
        MyLayout::write(&mut file, &names, &heights, &measurements)?;

        // Or define one on the spot, mixing user types with primitives.
        Layout::<(WeirdObject, WeirdObject, String, i32)>::write(
            &mut file,
            &weird,
            &weird,
            &"some string".to_string(),
            &1009,
        )?;

        file.flush()?;
    }

    {
        let mut file = IoReader::new(BufReader::new(File::open(&path)?));

        let (names2, heights2, measurements2) = MyLayout::read(&mut file)?;
        assert_eq!(names, names2);
        assert_eq!(heights, heights2);
        assert_eq!(measurements, measurements2);

        let (w1, w2, text, n) =
            Layout::<(WeirdObject, WeirdObject, String, i32)>::read(&mut file)?;
        assert_eq!(w1, weird);
        assert_eq!(w2, weird);
        assert_eq!(text, "some string");
        assert_eq!(n, 1009);
    }

    // Associative containers re-insert at their natural sorted position.
    type SetLayout = Layout<(i64, BTreeSet<String>)>;

    let set: BTreeSet<String> = ["Ann", "Joseph", "Catherine"]
        .into_iter()
        .map(str::to_string)
        .collect();

    // The exact same bytes work against an in-memory buffer sink.
    let mut buf = HeapSerializer::with_capacity(256);
    SetLayout::write(&mut buf, &0x00AD_FACE, &set)?;
    let (num, set2) = SetLayout::read(&mut buf)?;
    assert_eq!(num, 0x00AD_FACE);
    assert_eq!(set, set2);

    std::fs::remove_file(&path)?;
    println!("all layouts round-tripped through {}", path.display());
    Ok(())
}
