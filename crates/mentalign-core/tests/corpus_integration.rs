use std::fs;
use std::path::Path;

use mentalign_core::{
    render_conll, Corpus, CorpusConfig, CorpusError, FsDocumentCache, Partition, RegexTokenizer,
    Tag, Tokenizer, WhitespaceTokenizer,
};

const TRAIN: &str = "\
1|t|BRCA1 mutation increases cancer risk.
1|a|Second sentence here.
1\t0\t5\tBRCA1\tGene\tG672
1\t25\t31\tcancer\tDiseaseClass\tD009369
1\t25\t36\tcancer risk\tModifier\tD009369

2|t|Colon cancer.
2|a|Rare in children.
2\t0\t12\tColon cancer\tSpecificDisease\tD003110
";

const DEV: &str = "\
3|t|Ataxia telangiectasia (A-T).
3|a|A recessive disorder.
3\t0\t21\tAtaxia telangiectasia\tSpecificDisease\tD001260
3\t23\t26\tA-T\tSpecificDisease\tD001260
";

const TEST: &str = "\
4|t|No mentions at all.
4|a|Nothing to align.
";

fn write_corpus(dir: &Path) {
    fs::write(dir.join("NCBItrainset_corpus.txt"), TRAIN).unwrap();
    fs::write(dir.join("NCBIdevelopset_corpus.txt"), DEV).unwrap();
    fs::write(dir.join("NCBItestset_corpus.txt"), TEST).unwrap();
}

fn load(dir: &Path) -> Corpus<RegexTokenizer> {
    Corpus::load(dir, RegexTokenizer::new().unwrap(), dir.join("cache")).unwrap()
}

#[test]
fn test_corrupted_offsets_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let content = "9|t|BRCA1 mutation.\n9|a|Body.\n9\t0\t5\tBRCX1\tGene\tG672\n";
    fs::write(dir.path().join("NCBItrainset_corpus.txt"), content).unwrap();

    let result = Corpus::load(dir.path(), RegexTokenizer::new().unwrap(), dir.path().join("cache"));
    match result {
        Err(CorpusError::IntegrityViolation { id, expected, found, .. }) => {
            assert_eq!(id, "9");
            assert_eq!(expected, "BRCX1");
            assert_eq!(found, "BRCA1");
        }
        Err(other) => panic!("expected IntegrityViolation, got {other:?}"),
        Ok(_) => panic!("corrupted corpus loaded"),
    }
}

#[test]
fn test_unrecognized_file_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    fs::write(dir.path().join("extra.txt"), TEST).unwrap();

    let result = Corpus::load(dir.path(), RegexTokenizer::new().unwrap(), dir.path().join("cache"));
    assert!(matches!(result, Err(CorpusError::UnrecognizedFile { .. })));
}

#[test]
fn test_every_document_is_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let corpus = load(dir.path());
    assert_eq!(corpus.len(), 4);

    for document in corpus.iter() {
        let document = document.unwrap();
        assert_eq!(document.tags.len(), document.sentences.len());
        for sentence in &document.sentences {
            assert!(sentence.token_offsets().windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_lookups_are_stable_across_corpus_instances() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    let corpus = load(dir.path());
    let first = corpus.lookup("1").unwrap().clone();
    assert_eq!(&first, corpus.lookup("1").unwrap());
    assert!(dir.path().join("cache/1.json").is_file());

    let reopened = load(dir.path());
    assert_eq!(&first, reopened.lookup("1").unwrap());
}

#[test]
fn test_brca1_and_overlapping_mentions() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let corpus = load(dir.path());
    let document = corpus.lookup("1").unwrap();

    assert_eq!(document.sentences.len(), 2);
    assert_eq!(
        document.tags[0],
        vec![
            Tag::new("BRCA1", (0, 1), "Gene"),
            Tag::new("cancer", (3, 4), "DiseaseClass"),
            Tag::new("cancer risk", (3, 5), "Modifier"),
        ]
    );
    assert!(document.tags[1].is_empty());
}

#[test]
fn test_unknown_document() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let corpus = load(dir.path());

    assert!(matches!(corpus.lookup("10021369"), Err(CorpusError::NotFound { .. })));
    assert!(!dir.path().join("cache/10021369.json").exists());
}

#[test]
fn test_partitions_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let corpus = load(dir.path());

    assert_eq!(corpus.partition_by_name("training").unwrap(), &["1", "2"]);
    assert_eq!(corpus.partition_by_name("development").unwrap(), &["3"]);
    assert_eq!(corpus.partition_by_name("testing").unwrap(), &["4"]);
    assert_eq!(corpus.partition_of("3"), Some(Partition::Development));
    assert!(matches!(
        corpus.partition_by_name("validation"),
        Err(CorpusError::UnknownPartition(_))
    ));
}

#[test]
fn test_custom_file_table_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("train.pubtator"), TRAIN).unwrap();
    fs::write(dir.path().join("dev.pubtator"), DEV).unwrap();

    let config = CorpusConfig::new()
        .with_extension("pubtator")
        .with_partition_files([
            ("train.pubtator", Partition::Training),
            ("dev.pubtator", Partition::Development),
        ]);
    let cache = FsDocumentCache::new(dir.path().join("cache")).unwrap();
    let corpus =
        Corpus::load_with(dir.path(), RegexTokenizer::new().unwrap(), cache, &config).unwrap();

    // "A-T" is split into three tokens, which still concatenate back.
    let development = corpus.corpus_report(Some(Partition::Development)).unwrap();
    assert_eq!(development.annotations, 2);
    assert_eq!(development.exact, 2);

    let total = corpus.corpus_report(None).unwrap();
    assert_eq!(total.annotations, 6);
    assert_eq!(total.aligned, 6);
    assert_eq!(total.dropped(), 0);
}

#[test]
fn test_conll_output() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let corpus = load(dir.path());

    let conll = render_conll(corpus.lookup("2").unwrap());
    assert!(conll.starts_with("Colon\tB-SpecificDisease\ncancer\tI-SpecificDisease\n.\tO\n\n"));
}

#[test]
fn test_tokenizer_chosen_at_runtime() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    for pretokenized in [false, true] {
        let tokenizer: Box<dyn Tokenizer> = if pretokenized {
            Box::new(WhitespaceTokenizer::new())
        } else {
            Box::new(RegexTokenizer::new().unwrap())
        };
        let cache_root = dir.path().join(format!("cache-{pretokenized}"));
        let corpus = Corpus::load(dir.path(), tokenizer, cache_root).unwrap();

        let document = corpus.lookup("2").unwrap();
        assert_eq!(document.tags.len(), document.sentences.len());
        assert_eq!(document.tags[0][0].text, "Colon cancer");
    }
}
