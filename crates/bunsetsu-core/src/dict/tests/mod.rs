mod word_dic;
